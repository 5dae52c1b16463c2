//! stlaunch-cloud binary — the cloud profile with no flags of its own.
//! The hosting platform supplies the port through $PORT.

fn main() {
    match stlaunch::run_cloud() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
