//! Listing of the built-in assigned GATT services.

use uuidy_core::knowledge::{BLUETOOTH, SIG_BASE_SUFFIX};

/// Print one line per known service: full UUID, name, description.
pub fn run_known() {
    println!("{} known services:", BLUETOOTH.services.len());
    for service in BLUETOOTH.services {
        println!(
            "  0000{}{}  {:<32} {}",
            service.short_id.to_lowercase(),
            SIG_BASE_SUFFIX,
            service.name,
            service.description
        );
    }
}
