use fridgewise::app::{LoadingMessages, MESSAGE_INTERVAL};
use fridgewise::{
    provider_from_config, App, AppConfig, DietaryFilter, ImageResource, Recipe, RecipeService,
};
use log::error;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: fridgewise [--hero] [--filter <tag>] <image>...

Snap a photo of your leftovers and get recipe ideas.

Options:
  --hero            Generate the landing illustration and print its URL
  --filter <tag>    Only show recipes tagged: Quick Meals, Vegetarian, Gluten-Free, Vegan
  -h, --help        Show this message

Configuration is read from fridgewise.toml and FRIDGEWISE__* variables.
The API key falls back to API_KEY or GEMINI_API_KEY.";

struct Args {
    hero: bool,
    filter: DietaryFilter,
    images: Vec<String>,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = Args {
        hero: false,
        filter: DietaryFilter::All,
        images: Vec::new(),
    };

    let mut raw = env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--hero" => args.hero = true,
            "--filter" => {
                let tag = raw.next().ok_or("--filter needs a tag")?;
                args.filter = tag.parse()?;
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            path => args.images.push(path.to_string()),
        }
    }

    if !args.hero && args.images.is_empty() {
        return Err("Please provide at least one image".to_string());
    }
    Ok(Some(args))
}

fn print_recipe(recipe: &Recipe) {
    let draft = &recipe.draft;
    println!("\n## {}", draft.title);
    println!(
        "{} min · {} · {}",
        draft.prep_time,
        draft.difficulty,
        if draft.dietary_tags.is_empty() {
            "no tags".to_string()
        } else {
            draft.dietary_tags.join(", ")
        }
    );
    println!("Image: {}", short_url(&recipe.image));
    println!("\nIngredients:");
    for ingredient in &draft.ingredients {
        println!("  - {}", ingredient);
    }
    println!("\nInstructions:");
    for (step, instruction) in draft.instructions.iter().enumerate() {
        println!("  {}. {}", step + 1, instruction);
    }
}

// Data URLs run to megabytes; only show the header
fn short_url(url: &str) -> String {
    match url.split_once(";base64,") {
        Some((header, data)) => format!("{};base64,<{} bytes>", header, data.len()),
        None => url.to_string(),
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // The hero image falls back on its own, even without a usable configuration
    if args.hero {
        println!("Hero image: {}", short_url(&fridgewise::hero_image().await));
        if args.images.is_empty() {
            return Ok(());
        }
    }

    let config = AppConfig::load()?;
    let provider = provider_from_config(&config)?;
    let service = RecipeService::new(provider, &config);
    let mut app = App::new();
    app.stage_images(args.images.iter().map(|path| ImageResource::from_path(path)));

    let Some(images) = app.begin_analysis() else {
        return Err(app.error().unwrap_or("No images to analyze").into());
    };

    let analysis = service.generate_recipes_from_images(&images);
    tokio::pin!(analysis);

    let mut messages = LoadingMessages::new();
    let mut ticker = tokio::time::interval(MESSAGE_INTERVAL);
    let result = loop {
        tokio::select! {
            result = &mut analysis => break result,
            _ = ticker.tick() => {
                if let Some(message) = messages.next() {
                    eprintln!("{}", message);
                }
            }
        }
    };
    app.complete_analysis(result);

    if let Some(message) = app.error() {
        return Err(message.into());
    }

    app.set_filter(args.filter);
    println!("# Your Ingredients, Reimagined");
    println!("We found: {}", app.ingredients().join(", "));

    let visible = app.visible_recipes();
    if visible.is_empty() {
        println!("\nNo recipes match your filter. Try selecting 'All'!");
    }
    for recipe in visible {
        print_recipe(recipe);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
