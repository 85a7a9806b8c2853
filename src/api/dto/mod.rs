//! Response DTOs for the status API.

pub mod chain_dto;

pub use chain_dto::{ChainListResponse, ChainStatusDto};
