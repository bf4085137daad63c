use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    liaoyu::cli::main()
}
