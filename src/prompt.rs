use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::args::Args;
use crate::geocode::Coordinates;

const YEAR_PROMPT: &str = "Please enter a year you would like to have a map for:";
const LOCATION_PROMPT: &str = "Please enter your location (format: lat, long):";
const DATASET_DIR_PROMPT: &str =
    "Please, enter path to directory, where dataset is stored without \"/\".\nExample: /Users/me/Documents/imdb :";

#[derive(Debug, Clone, PartialEq)]
pub struct RunInputs {
    pub year: i32,
    pub user_location: Coordinates,
    pub dataset_dir: PathBuf,
}

pub fn parse_user_location(text: &str) -> Result<Coordinates> {
    let parts: Vec<&str> = text.trim().split(',').collect();
    let [lat, lon] = parts.as_slice() else {
        bail!("Expected location as \"lat,lon\", got {text:?}");
    };
    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude {lat:?}"))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude {lon:?}"))?;
    Ok(Coordinates::new(lat, lon))
}

pub fn resolve_inputs(args: &Args) -> Result<RunInputs> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    resolve_inputs_from(args, &mut input, &mut output)
}

pub fn resolve_inputs_from<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> Result<RunInputs> {
    let year = match args.year {
        Some(year) => year,
        None => {
            let answer = ask(input, output, YEAR_PROMPT)?;
            answer
                .trim()
                .parse()
                .with_context(|| format!("Invalid year {:?}", answer.trim()))?
        }
    };
    let user_location = match args.location {
        Some(location) => location,
        None => parse_user_location(&ask(input, output, LOCATION_PROMPT)?)?,
    };
    let dataset_dir = match &args.dataset_dir {
        Some(dir) => dir.clone(),
        None => PathBuf::from(ask(input, output, DATASET_DIR_PROMPT)?.trim()),
    };
    Ok(RunInputs {
        year,
        user_location,
        dataset_dir,
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    writeln!(output, "{prompt}").context("Failed writing prompt")?;
    output.flush().context("Failed flushing prompt")?;
    let mut answer = String::new();
    let read = input.read_line(&mut answer).context("Failed reading answer")?;
    if read == 0 {
        bail!("No answer given for: {}", prompt.lines().next().unwrap_or(prompt));
    }
    Ok(answer)
}
