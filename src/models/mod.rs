pub mod city;
pub mod exclusion;
pub mod forecast;
