use census::{dataset, filter};

fn main() {
    let df = dataset::load("sub-division_population_of_pakistan.csv").unwrap();
    for province in filter::provinces(&df).unwrap() {
        for division in filter::divisions(&df, &province).unwrap() {
            let districts = filter::districts(&df, &province, &division).unwrap();
            println!("{} / {}: {} districts", province, division, districts.len());
        }
    }
}
