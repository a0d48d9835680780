use rocket::{Build, Rocket};
use spendwise::{Config, build_rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = Config::load().expect("failed to load configuration");
    build_rocket(config)
}
