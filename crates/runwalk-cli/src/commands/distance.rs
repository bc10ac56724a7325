use clap::Args;
use runwalk_core::geo::great_circle_miles;
use runwalk_core::Position;

#[derive(Args)]
pub struct DistanceArgs {
    #[arg(allow_hyphen_values = true)]
    lat1: f64,
    #[arg(allow_hyphen_values = true)]
    lon1: f64,
    #[arg(allow_hyphen_values = true)]
    lat2: f64,
    #[arg(allow_hyphen_values = true)]
    lon2: f64,
}

pub fn run(args: DistanceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let from = Position::new(args.lat1, args.lon1);
    let to = Position::new(args.lat2, args.lon2);
    from.validate()?;
    to.validate()?;

    println!("{:.4}", great_circle_miles(&from, &to));
    Ok(())
}
