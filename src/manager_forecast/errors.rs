use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http request error: {0}")]
    Http(String),
    #[error("forecast document error: {0}")]
    Document(String),
    #[error("empty forecast document")]
    Empty,
}
impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> FetchError {
        FetchError::Http(e.to_string())
    }
}
impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> FetchError {
        FetchError::Document(e.to_string())
    }
}
