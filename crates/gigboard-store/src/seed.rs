use crate::StoreError;
use gigboard_model::Region;
use rusqlite::{params, Connection};

/// Initial tag vocabulary. Admins grow it from here.
pub const SEED_TAGS: &[&str] = &[
    "Photography",
    "Cinematography",
    "Video Editing",
    "Music",
    "Audio Recording",
    "Dance",
    "Acting",
    "Graphic Design",
];

/// Reference zipcodes: (code, place name). Region is derived at load time
/// from the place name; the 00000 sentinel backs remote-only gigs.
pub const SEED_ZIPCODES: &[(&str, &str)] = &[
    ("00000", "Remote"),
    ("94102", "San Francisco"),
    ("94103", "San Francisco"),
    ("94107", "San Francisco"),
    ("94109", "San Francisco"),
    ("94110", "San Francisco"),
    ("94112", "San Francisco"),
    ("94114", "San Francisco"),
    ("94117", "San Francisco"),
    ("94121", "San Francisco"),
    ("94122", "San Francisco"),
    ("94014", "Daly City"),
    ("94015", "Daly City"),
    ("94080", "South San Francisco"),
    ("94066", "San Bruno"),
    ("94044", "Pacifica"),
    ("94030", "Millbrae"),
    ("94010", "Burlingame"),
    ("94401", "San Mateo"),
    ("94403", "San Mateo"),
    ("94404", "Foster City"),
    ("94002", "Belmont"),
    ("94070", "San Carlos"),
    ("94061", "Redwood City"),
    ("94063", "Redwood City"),
    ("94025", "Menlo Park"),
    ("94301", "Palo Alto"),
    ("94306", "Palo Alto"),
    ("94303", "East Palo Alto"),
    ("94019", "Half Moon Bay"),
    ("94965", "Sausalito"),
    ("94941", "Mill Valley"),
    ("94960", "San Anselmo"),
    ("94901", "San Rafael"),
    ("94903", "San Rafael"),
    ("94945", "Novato"),
    ("94952", "Petaluma"),
    ("95401", "Santa Rosa"),
    ("95404", "Santa Rosa"),
    ("95476", "Sonoma"),
    ("94558", "Napa"),
    ("94590", "Vallejo"),
    ("94510", "Benicia"),
    ("94533", "Fairfield"),
    ("95687", "Vacaville"),
    ("94601", "Oakland"),
    ("94607", "Oakland"),
    ("94610", "Oakland"),
    ("94612", "Oakland"),
    ("94702", "Berkeley"),
    ("94704", "Berkeley"),
    ("94706", "Albany"),
    ("94530", "El Cerrito"),
    ("94801", "Richmond"),
    ("94804", "Richmond"),
    ("94608", "Emeryville"),
    ("94501", "Alameda"),
    ("94577", "San Leandro"),
    ("94546", "Castro Valley"),
    ("94541", "Hayward"),
    ("94544", "Hayward"),
    ("94587", "Union City"),
    ("94560", "Newark"),
    ("94536", "Fremont"),
    ("94538", "Fremont"),
    ("94568", "Dublin"),
    ("94566", "Pleasanton"),
    ("94550", "Livermore"),
    ("94553", "Martinez"),
    ("94520", "Concord"),
    ("94596", "Walnut Creek"),
    ("94565", "Pittsburg"),
    ("94509", "Antioch"),
    ("94040", "Mountain View"),
    ("94043", "Mountain View"),
    ("94085", "Sunnyvale"),
    ("94087", "Sunnyvale"),
    ("95014", "Cupertino"),
    ("95050", "Santa Clara"),
    ("95110", "San Jose"),
    ("95112", "San Jose"),
    ("95125", "San Jose"),
    ("95128", "San Jose"),
    ("95008", "Campbell"),
    ("95070", "Saratoga"),
    ("95030", "Los Gatos"),
    ("95035", "Milpitas"),
    ("95037", "Morgan Hill"),
    ("95020", "Gilroy"),
    ("95814", "Sacramento"),
    ("95816", "Sacramento"),
    ("95818", "Sacramento"),
    ("95691", "West Sacramento"),
    ("95624", "Elk Grove"),
    ("95610", "Citrus Heights"),
    ("95670", "Rancho Cordova"),
    ("95630", "Folsom"),
    ("95661", "Roseville"),
    ("95616", "Davis"),
    ("95202", "Stockton"),
    ("95240", "Lodi"),
];

/// Loads zipcodes and the tag vocabulary if the tables are empty.
pub fn seed_reference_data(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    {
        let zip_count: i64 = tx.query_row("SELECT COUNT(*) FROM zipcodes", [], |r| r.get(0))?;
        if zip_count == 0 {
            let mut stmt = tx.prepare(
                "INSERT INTO zipcodes (valid_zipcode, location_name, region) VALUES (?1, ?2, ?3)",
            )?;
            for (code, place) in SEED_ZIPCODES {
                let region = Region::classify(place);
                stmt.execute(params![code, place, region.as_str()])?;
            }
        }

        let tag_count: i64 = tx.query_row("SELECT COUNT(*) FROM tags", [], |r| r.get(0))?;
        if tag_count == 0 {
            let mut stmt = tx.prepare("INSERT INTO tags (tag_name) VALUES (?1)")?;
            for tag in SEED_TAGS {
                stmt.execute(params![tag])?;
            }
        }
    }
    tx.commit()?;
    Ok(())
}
