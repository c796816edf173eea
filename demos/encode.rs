use aamva_dlid::{
    jurisdiction,
    render::{Renderer, TextSheetRenderer},
    sample, PersonRecord,
};

/// Jurisdiction the card is issued by.
const JURISDICTION: &str = "California";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let record = PersonRecord {
        license_number: Some("A1234567".to_owned()),
        last_name: Some("Doe".to_owned()),
        first_name: Some("Jane".to_owned()),
        address: Some("1 Main St".to_owned()),
        city: Some("Los Angeles".to_owned()),
        postal_code: Some("90001".to_owned()),
        birth_date: Some("01011990".to_owned()),
        issue_date: Some("01012022".to_owned()),
        expiry_date: Some("01012026".to_owned()),
        sex: Some("Female".to_owned()),
        eye_color: Some("BRO".to_owned()),
        height: Some("65".to_owned()),
        weight: Some("130".to_owned()),
        hair_color: Some("BLK".to_owned()),
        class: Some("C".to_owned()),
        donor: Some("NO".to_owned()),
        // Auto-filled, as a form would.
        document_discriminator: Some(sample::generate_random_alphanumeric(
            aamva_dlid::record::DOCUMENT_DISCRIMINATOR_LEN,
        )),
        inventory_control_number: Some(sample::generate_random_alphanumeric(
            aamva_dlid::record::INVENTORY_CONTROL_NUMBER_LEN,
        )),
        ..Default::default()
    };

    let profile = jurisdiction::lookup(JURISDICTION).unwrap();
    let payload =
        aamva_dlid::encode(JURISDICTION, &record, &profile.iin().to_string()).unwrap();
    eprintln!("payload ({} bytes): {payload:?}", payload.len());

    let document = TextSheetRenderer
        .render(&payload, &record, profile)
        .unwrap();
    eprintln!("{} ({})", document.file_name, document.media_type);
    println!("{}", String::from_utf8_lossy(&document.bytes))
}
