fn main() {
    if let Err(err) = kinpath::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
