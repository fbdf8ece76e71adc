fn main() {
    if let Err(e) = ifa_lib::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
