use clap::{Parser, Subcommand};
use hexpalette::config::{self, TrackerConfig};
use hexpalette::model::Model;
use hexpalette::palette;
use hexpalette::profiles::{self, Layout, Profile, ProfileKey};
use hexpalette::store::{self, SaveData, SaveStore};
use hexpalette::trackables::{base_catalog, TrackableId};

#[derive(Parser, Debug)]
#[command(name = "hexpalette", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Profile key to use instead of the configured one
    #[arg(short, long)]
    profile: Option<String>,

    /// Preset layout index within the profile
    #[arg(short, long)]
    layout: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List the built-in profiles
    Profiles,
    /// Show current values and goal fulfillment for the active profile
    Status,
    /// Print cell placement and the outline polygon of the active layout
    Outline,
    /// Add an increment step to a trackable (subtract with --down)
    Bump {
        /// Trackable id, as shown by `status`
        id: String,
        /// Increment level to apply (index into the step list)
        #[arg(long, default_value_t = 0)]
        level: usize,
        #[arg(long)]
        down: bool,
    },
    /// Reset every value to its minimum and clear the save file
    Reset,
}

struct Session {
    configuration: TrackerConfig,
    profile: Profile,
    model: Model,
    store: SaveStore,
}

fn open_session(cli: &Cli) -> anyhow::Result<Session> {
    let mut configuration = config::load_or_default();
    if let Some(profile) = &cli.profile {
        configuration.profile = ProfileKey::new(profile.clone());
    }
    if let Some(layout) = cli.layout {
        configuration.layout = layout;
    }

    let registry = profiles::builtin_profiles();
    let profile = profiles::find_profile(&registry, &configuration.profile)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("unknown profile '{}'", configuration.profile))?;

    let mut model = Model::new();
    model.initialize(profile.resolve(&base_catalog())?);

    let store = SaveStore::open_default()?;
    if let Some(data) = store.load()?
        && store::apply_saved_values(&mut model, &data, &configuration.profile)?
    {
        log::info!("Restored saved values from {}", store.path().display());
    }

    Ok(Session {
        configuration,
        profile,
        model,
        store,
    })
}

fn active_layout(session: &Session) -> anyhow::Result<&Layout> {
    session
        .profile
        .layout(session.configuration.layout)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "profile '{}' has no layout {}",
                session.profile.key,
                session.configuration.layout
            )
        })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.clone().unwrap_or(Commands::Status) {
        Commands::Profiles => {
            for profile in profiles::builtin_profiles() {
                println!(
                    "{:<32} {} ({} layouts)",
                    profile.key,
                    profile.name,
                    profile.layouts.len()
                );
            }
            Ok(())
        }
        Commands::Status => {
            let session = open_session(&cli)?;
            let layout = active_layout(&session)?;
            println!(
                "{} (layout {})",
                session.profile.name, session.configuration.layout
            );
            for (id, entry) in layout {
                let description = &session.model.definition(id)?.description;
                let goal = session.model.goal_status(id)?;
                let text = palette::value_text(&session.model, id)?;
                println!(
                    "{} {:<14} {:>8}  {} [{}]",
                    if goal.fulfilled { "*" } else { " " },
                    id,
                    if text.is_empty() { "-" } else { text.as_str() },
                    description,
                    entry.code,
                );
            }
            Ok(())
        }
        Commands::Outline => {
            let session = open_session(&cli)?;
            let geometry = palette::bake(active_layout(&session)?)?;
            for cell in &geometry.cells {
                println!(
                    "{:<14} ({:>7.2}, {:>7.2}) [{}]",
                    cell.id, cell.center.x, cell.center.y, cell.code
                );
            }
            let path: Vec<String> = geometry
                .outline
                .iter()
                .map(|point| format!("{:.2},{:.2}", point.x, point.y))
                .collect();
            println!("outline: {}", path.join(" "));
            println!(
                "bounds: {:.0}x{:.0}",
                geometry.bounds.width, geometry.bounds.height
            );
            Ok(())
        }
        Commands::Bump { id, level, down } => {
            let mut session = open_session(&cli)?;
            let id = TrackableId::new(id);
            let factor = if down { -1.0 } else { 1.0 };
            session.model.increment_by_level(&id, level, factor)?;

            session.store.save(&SaveData {
                configuration: Some(session.configuration.clone()),
                values: session.model.snapshot(),
            })?;
            println!("{} = {}", id, session.model.value(&id)?);
            Ok(())
        }
        Commands::Reset => {
            let mut session = open_session(&cli)?;
            session.model.reset();
            session.store.clear()?;
            println!("reset '{}'", session.profile.key);
            Ok(())
        }
    }
}
