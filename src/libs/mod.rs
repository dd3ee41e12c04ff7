pub mod cluster;
pub mod mum;
