fn main() {
    let code = flix_cli::run_cli();
    std::process::exit(code);
}
