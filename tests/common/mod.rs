pub mod synthetic_qu;
