//! Report content shared by the PDF and Excel writers.

pub mod pdf_core;
