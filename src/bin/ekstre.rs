use ekstre::cmd::command_main;

fn main() {
    if let Err(e) = command_main() {
        if !e.is_empty() {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
