use std::io::Read;
use stepjson_core::parse;

fn main() {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input).unwrap();

    match parse(&input) {
        Ok(root) => println!("{root:#}"),
        Err(err) => eprintln!("{err}"),
    }
}
