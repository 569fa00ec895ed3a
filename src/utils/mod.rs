pub mod hasher;
pub mod jwt;
