fn main() {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = oid2yolo::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
