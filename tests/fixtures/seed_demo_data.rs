// ==========================================
// Demo data seeder
// ==========================================
// Usage: cargo run --bin seed_demo_data
// Seeds one campus with a handful of extinguishers; safe to re-run.
// ==========================================

use std::error::Error;

use chrono::{NaiveDate, TimeZone, Utc};

use edms_core::app::get_default_db_path;
use edms_core::db::{init_schema, open_sqlite_connection};
use edms_core::domain::types::{DeviceStatus, UserRole};
use edms_core::domain::NewDevice;
use edms_core::repository::{
    DeviceFilter, DeviceRepository, DeviceTypeRepository, LocationRepository, UserRepository,
};

const EXTINGUISHER_AGENTS: &[&str] = &["CO2", "Water", "Dry Powder", "Foam", "Wet Chemical"];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = get_default_db_path();
    println!("seeding demo data into {}", db_path);

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    drop(conn);

    let location_repo = LocationRepository::new(&db_path)?;
    let device_type_repo = DeviceTypeRepository::new(&db_path)?;
    let user_repo = UserRepository::new(&db_path)?;
    let device_repo = DeviceRepository::new(&db_path)?;

    // ==========================================
    // Locations
    // ==========================================
    let site_id = match location_repo.find_site_by_name("Main Campus")? {
        Some(site) => site.site_id,
        None => location_repo.insert_site("Main Campus", "1 Factory Road", None)?,
    };
    let building_a = ensure_building(&location_repo, site_id, "A")?;
    let building_b = ensure_building(&location_repo, site_id, "B")?;
    let room_101 = ensure_room(&location_repo, building_a, "101")?;
    let room_102 = ensure_room(&location_repo, building_a, "102")?;
    let room_201 = ensure_room(&location_repo, building_b, "201")?;

    // ==========================================
    // Reference types
    // ==========================================
    let device_type_id = match device_type_repo.find_device_type_by_name("Fire Extinguisher")? {
        Some(t) => t.emergency_device_type_id,
        None => device_type_repo.insert_device_type("Fire Extinguisher")?,
    };
    let mut agent_ids = Vec::new();
    for agent in EXTINGUISHER_AGENTS {
        let id = match device_type_repo.find_extinguisher_type_by_name(agent)? {
            Some(t) => t.extinguisher_type_id,
            None => device_type_repo.insert_extinguisher_type(agent)?,
        };
        agent_ids.push(id);
    }

    // ==========================================
    // Accounts
    // ==========================================
    if user_repo.find_by_username("admin")?.is_none() {
        user_repo.insert("admin", "admin@localhost", UserRole::Admin, true)?;
    }
    if user_repo.find_by_username("inspector1")?.is_none() {
        user_repo.insert("inspector1", "inspector1@example.com", UserRole::User, false)?;
    }

    // ==========================================
    // Devices
    // ==========================================
    if !device_repo.list(&DeviceFilter::default())?.is_empty() {
        println!("devices already present, leaving them untouched");
        return Ok(());
    }

    let manufacture = NaiveDate::from_ymd_opt(2024, 1, 1);
    let devices = [
        // (serial, room, agent index, size, status, last inspection)
        ("SN00001", room_101, 2, "6kg", None, None),
        ("SN00002", room_102, 0, "2kg", None, None),
        ("SN00003", room_201, 1, "9L", None, None),
        (
            "SN00004",
            room_101,
            3,
            "6L",
            Some(DeviceStatus::Active),
            Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()),
        ),
    ];
    for (serial, room_id, agent_idx, size, status, last_inspection_at) in devices {
        let device_id = device_repo.insert(&NewDevice {
            emergency_device_type_id: device_type_id,
            extinguisher_type_id: Some(agent_ids[agent_idx]),
            room_id,
            serial_number: Some(serial.to_string()),
            manufacture_date: manufacture,
            last_inspection_at,
            description: Some(format!("demo unit {}", serial)),
            size: Some(size.to_string()),
            status,
        })?;
        println!("created device {} (id={})", serial, device_id);
    }

    println!("demo data ready");
    Ok(())
}

fn ensure_building(
    location_repo: &LocationRepository,
    site_id: i64,
    code: &str,
) -> Result<i64, Box<dyn Error>> {
    Ok(match location_repo.find_building(site_id, code)? {
        Some(b) => b.building_id,
        None => location_repo.insert_building(site_id, code)?,
    })
}

fn ensure_room(
    location_repo: &LocationRepository,
    building_id: i64,
    code: &str,
) -> Result<i64, Box<dyn Error>> {
    Ok(match location_repo.find_room(building_id, code)? {
        Some(r) => r.room_id,
        None => location_repo.insert_room(building_id, code)?,
    })
}
