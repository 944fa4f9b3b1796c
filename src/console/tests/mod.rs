//! Scenario tests driving the console through commands.
//!
//! Each test builds a fresh console over in-memory storage (or the fake
//! order API), a recording map surface and a fixed geocoder.

mod order_flow;

use pollster::block_on;

use super::{Command, Console, Outcome};
use crate::model::{OrderForm, Position};
use crate::store::{LocalBackend, MemoryStorage, RemoteBackend};
use crate::test_support::{FakeServer, FixedGeocoder, RecordingSurface};

type LocalConsole = Console<LocalBackend<MemoryStorage>, FixedGeocoder>;
type RemoteConsole = Console<RemoteBackend<FakeServer>, FixedGeocoder>;

struct Harness {
    console: LocalConsole,
    storage: MemoryStorage,
    surface: RecordingSurface,
}

fn geocoder() -> FixedGeocoder {
    FixedGeocoder::new().with_place("Bogotá", Position::new(-74.0721, 4.7110))
}

fn local_console_over(storage: MemoryStorage) -> Harness {
    let surface = RecordingSurface::new();
    let console = Console::new(
        LocalBackend::new(storage.clone()),
        Box::new(storage.clone()),
        Box::new(surface.clone()),
        geocoder(),
    );
    Harness {
        console,
        storage,
        surface,
    }
}

fn local_console() -> Harness {
    local_console_over(MemoryStorage::new())
}

fn remote_console(server: &FakeServer) -> (RemoteConsole, RecordingSurface) {
    let surface = RecordingSurface::new();
    let console = Console::new(
        RemoteBackend::new(server.clone(), "./php-api"),
        Box::new(MemoryStorage::new()),
        Box::new(surface.clone()),
        geocoder(),
    );
    (console, surface)
}

fn run<B, G>(console: &mut Console<B, G>, command: Command) -> Outcome
where
    B: crate::store::OrderBackend,
    G: crate::geocode::Geocoder,
{
    block_on(console.dispatch(command))
}

fn login<B, G>(console: &mut Console<B, G>, user_id: &str)
where
    B: crate::store::OrderBackend,
    G: crate::geocode::Geocoder,
{
    let outcome = run(
        console,
        Command::Login {
            user_id: user_id.to_string(),
        },
    );
    assert_eq!(outcome, Outcome::Applied, "login as {user_id}");
}

fn click<B, G>(console: &mut Console<B, G>, lon: f64, lat: f64) -> Outcome
where
    B: crate::store::OrderBackend,
    G: crate::geocode::Geocoder,
{
    run(console, Command::MapClick { lon, lat })
}

fn form(title: &str) -> OrderForm {
    OrderForm {
        title: title.to_string(),
        location: "Tunja".to_string(),
        pilot: "Carlos".to_string(),
        drone_id: "M300-07".to_string(),
        schedule: "2025-07-01T09:30".to_string(),
        ..OrderForm::default()
    }
}

fn latest_notice<B, G>(console: &Console<B, G>) -> String
where
    B: crate::store::OrderBackend,
    G: crate::geocode::Geocoder,
{
    console
        .notices()
        .latest()
        .map(|n| n.message.clone())
        .unwrap_or_default()
}
