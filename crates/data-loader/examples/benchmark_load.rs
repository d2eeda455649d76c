use data_loader::CutoffIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/cutoffs.csv");

    println!("Loading cutoff table...\n");

    let start = Instant::now();
    let index = CutoffIndex::load_from_file(path)
        .expect("Failed to load cutoff table");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Rows: {}", index.len());
    println!("Categories: {}", index.categories().join(", "));
    println!("Years: {:?}", index.years());
    println!("\nPerformance: {:.0} rows/second",
             index.len() as f64 / elapsed.as_secs_f64());
}
