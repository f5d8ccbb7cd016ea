use clap::{App, Arg};
use drift::lexer::Lexer;
use drift::parser::Parser;
use drift::token::TokenType;
use std::fs;
use std::process;

fn main() {
    env_logger::init();

    let matches = App::new("drift")
        .about("Parses a drift script and prints its canonical form")
        .arg(
            Arg::with_name("script")
                .help("Path to the script to parse")
                .required(true),
        )
        .arg(
            Arg::with_name("tokens")
                .long("tokens")
                .help("Dump the token stream instead of the AST"),
        )
        .get_matches();

    let path = matches.value_of("script").unwrap();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            process::exit(66);
        }
    };

    if matches.is_present("tokens") {
        dump_tokens(&source);
        return;
    }

    let mut parser = Parser::new(Lexer::new(&source));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        for error in parser.errors() {
            eprintln!("parse error: {}", error);
        }
        process::exit(65);
    }
    println!("{}", program);
}

fn dump_tokens(source: &str) {
    let mut lexer = Lexer::new(source);
    loop {
        let token = lexer.next_token();
        println!("{:?} {:?}", token.kind, token.literal);
        if token.kind == TokenType::Eof {
            break;
        }
    }
}
