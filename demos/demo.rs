//! Drives the command loop over a canned script, printing the transcript
//! to stdout. Run with `cargo run --example demo`.

use std::io::{self, Cursor};

use rowql::Repl;

fn main() -> rowql::Result<()> {
    let script = "\
# a small address book
CREATE people 3 string int bool name age subscribed
INSERT INTO people 4 ROWS
alice 30 true
bob 25 false
carol 30 true
dave 19 true
GENERATE FOR people hash INDEX ON age
PRINT FROM people 2 name age WHERE age = 30
DELETE FROM people WHERE age < 28
CREATE pets 2 string string owner species
INSERT INTO pets 3 ROWS
alice cat
carol dog
alice parrot
JOIN people AND pets WHERE name = owner PRINT 3 name 1 species 2 age 1
REMOVE pets
QUIT
";

    let stdout = io::stdout().lock();
    Repl::new(Cursor::new(script), stdout, false).run()
}
