#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use bucket_hashing::{
    ExtendibleHashing, HashingError, Key, LinearHashing, Scheme, SchemeConfig, Session,
};
use plotters::prelude::*;
use rand::Rng;

// Reference sequences used to demonstrate each scheme
const EXTENDIBLE_KEYS: [Key; 10] = [5, 7, 12, 14, 3, 9, 21, 27, 18, 23];
const LINEAR_KEYS: [Key; 13] = [3, 2, 4, 1, 8, 14, 5, 10, 7, 24, 17, 13, 15];
const BITMAP_KEYS: [Key; 8] = [3, 5, 7, 10, 12, 15, 20, 22];
const LINEAR_LOAD_FACTOR: f64 = 0.7;
const BITMAP_SIZE: usize = 8;

// Random growth experiment
const RANDOM_KEYS: usize = 5_000;
const KEY_RANGE: Key = 1_000_000;
const SAMPLE_EVERY: usize = 50;

/// Runs a fresh session of `scheme` over `keys`
fn replay(scheme: Scheme, config: SchemeConfig, keys: &[Key]) -> Result<Session, HashingError> {
    let mut session = Session::new(scheme, config)?;
    for &key in keys {
        session.insert(key);
    }
    Ok(session)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SchemeConfig::default()
        .with_load_factor_threshold(LINEAR_LOAD_FACTOR)
        .with_bitmap_size(BITMAP_SIZE);

    let sequences: [(Scheme, &[Key]); 3] = [
        (Scheme::Extendible, &EXTENDIBLE_KEYS),
        (Scheme::Linear, &LINEAR_KEYS),
        (Scheme::Bitmap, &BITMAP_KEYS),
    ];
    for (scheme, keys) in sequences {
        let session = replay(scheme, config, keys)?;
        println!("{scheme} after inserting {keys:?}:");
        println!("{}\n", session.render());

        let history = session.history_lines();
        if !history.is_empty() {
            println!("Bitmap History After Each Insertion:");
            for line in history {
                println!("{line}");
            }
        }
    }

    // Track how each scheme grows its bucket storage under uniform random keys
    let mut rng = rand::rng();
    let keys: Vec<Key> = (0..RANDOM_KEYS).map(|_| rng.random_range(0..KEY_RANGE)).collect();

    let mut extendible = ExtendibleHashing::new();
    let mut linear = LinearHashing::with_load_factor_threshold(LINEAR_LOAD_FACTOR)?;
    let mut directory_slots: Vec<(usize, f64)> = Vec::new();
    let mut extendible_buckets: Vec<(usize, f64)> = Vec::new();
    let mut linear_buckets: Vec<(usize, f64)> = Vec::new();

    for (position, &key) in keys.iter().enumerate() {
        extendible.insert(key);
        linear.insert(key);

        let inserted = position + 1;
        if inserted % SAMPLE_EVERY == 0 {
            directory_slots.push((inserted, extendible.directory_len() as f64));
            extendible_buckets.push((inserted, extendible.bucket_count() as f64));
            linear_buckets.push((inserted, linear.bucket_count() as f64));
        }
    }

    println!(
        "\nAfter {RANDOM_KEYS} random keys: extendible global depth {} ({} slots, {} buckets), \
         linear level {} ({} buckets, next split {})",
        extendible.global_depth(),
        extendible.directory_len(),
        extendible.bucket_count(),
        linear.level(),
        linear.bucket_count(),
        linear.split_pointer()
    );

    let font_family = "sans-serif";
    let series = [
        ("Extendible directory slots", &directory_slots, RGBColor(220, 50, 50)),
        ("Extendible buckets", &extendible_buckets, RGBColor(50, 90, 220)),
        ("Linear buckets", &linear_buckets, RGBColor(50, 180, 50)),
    ];

    let root = BitMapBackend::new("bucket_growth.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_buckets = series
        .iter()
        .flat_map(|(_, points, _)| points.iter().map(|&(_, y)| y))
        .fold(1.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Bucket Growth Under Random Inserts", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..RANDOM_KEYS, 0.0..max_buckets)?;

    chart
        .configure_mesh()
        .x_desc("Keys Inserted")
        .y_desc("Buckets")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (label, points, color) in series {
        let line_style = ShapeStyle::from(&color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    println!("Generated plot image: bucket_growth.png");

    Ok(())
}
