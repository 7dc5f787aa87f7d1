use servidores::app;

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let server = app::init()?;
    server.await?;
    Ok(())
}
