use std::io::{Read, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let text = {
        let stdin = std::io::stdin();
        let mut l = stdin.lock();
        let mut s = String::new();
        l.read_to_string(&mut s)?;
        s
    };

    let html = bbcode_bridge::bbcode2html(&text)?;
    writeln!(std::io::stdout().lock(), "{}", html)?;

    Ok(())
}
