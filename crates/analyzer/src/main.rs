use analyzer::runtime::{self, boot};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot(std::env::args().skip(1))?;
    runtime::run(config).await?;
    Ok(())
}
