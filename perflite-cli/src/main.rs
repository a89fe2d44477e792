fn main() -> anyhow::Result<()> {
    perflite_cli::run()
}
