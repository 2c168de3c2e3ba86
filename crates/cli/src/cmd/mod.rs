pub mod doctor;
pub mod generate;
pub mod insert;
pub mod inspect;
pub mod output;
pub mod sections;

use std::future::Future;

use color_eyre::eyre::{Result, WrapErr};

/// Drive a future to completion on a single-threaded runtime.
pub fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;
    Ok(rt.block_on(fut))
}
