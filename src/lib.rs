pub mod error;

pub mod service {
    pub mod config_service;
    pub mod document;
    pub mod docx;
    pub mod file;
    pub mod html;
    pub mod registry;
    pub mod script;
    pub mod strings;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod config {
    pub mod config;
    pub mod ports;
    pub mod settings;
}

pub mod models {
    pub mod conversion;
    pub mod file;
    pub mod strings;
}

pub mod facade {
    pub mod conversion_facade;
    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod utils {
    pub mod convert;
    pub mod utils;
}
