fn main() {
    if let Err(e) = magda_lib::run() {
        eprintln!("magda: {e}");
        std::process::exit(1);
    }
}
