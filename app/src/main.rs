fn main() -> anyhow::Result<()> {
    legato_lib::run()
}
