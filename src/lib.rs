// src/lib.rs

// API (servidor)
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

// Visor do historial de entradas (cliente da API)
pub mod viewer;
