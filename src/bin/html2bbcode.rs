use std::io::{Read, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut html = String::new();
    std::io::stdin().lock().read_to_string(&mut html)?;

    let bbcode = bbcode_bridge::html2bbcode(&html);
    writeln!(std::io::stdout().lock(), "{}", bbcode)?;

    Ok(())
}
