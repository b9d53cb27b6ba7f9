//! incrust — binaire. Toute la logique vit dans la lib du crate.

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    incrust_cli::run()
}
