fn main() -> anyhow::Result<()> {
    env_logger::init();
    evolance_portal::run_portal()
}
