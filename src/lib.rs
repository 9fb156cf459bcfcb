//! Client/glue layer for the ModredIP intellectual-property registry
//! contract on Hedera. Encodes calls against the fixed contract ABI,
//! submits them through a signing account, and exposes a small HTTP
//! surface for license minting.

pub mod chain;
pub mod config;
pub mod contracts;
pub mod routes;
