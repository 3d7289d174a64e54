use std::path::PathBuf;

use relay_speech::{PredictOptions, Predictor, PredictorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let wav_path = PathBuf::from(
        args.get(1)
            .map(|value| value.as_str())
            .unwrap_or("samples/dots.wav"),
    );
    let align_output = args.iter().any(|a| a == "--align");
    let debug = args.iter().any(|a| a == "--debug");
    let initial_prompt = args
        .iter()
        .position(|a| a == "--prompt")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let config = PredictorConfig::from_env();
    let predictor = Predictor::load(&config)?;

    let options = PredictOptions {
        align_output,
        debug,
        initial_prompt,
        ..Default::default()
    };

    let json = predictor.predict(&wav_path, &options)?;
    println!("{json}");

    Ok(())
}
