use wavec_drv::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse(std::env::args().skip(1))?;
    let failed = wavec_drv::run(&config)?;
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
