//! Backend module - Code generation

pub mod asm;

pub use asm::generate_assembly_print;
