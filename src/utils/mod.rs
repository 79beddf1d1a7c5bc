pub mod config;

pub use config::{
    short_address_for_host_octet, ConfigError, SurveyConfig, SHORT_ADDRESS_OFFSET,
};
