//! siteclock main entrypoint.

use siteclock::run;
use siteclock::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
