mod cmd_mgaps;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let app = cmd_mgaps::make_command();
    cmd_mgaps::execute(&app.get_matches())?;

    Ok(())
}
