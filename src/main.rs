use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use course_cart::storage::stored_carts;
use course_cart::view::price_label;
use course_cart::{CartConfig, Storefront, User};

#[derive(Parser)]
#[command(name = "course-cart", version)]
#[command(about = "Shopping cart for a course marketplace", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// SQLite database holding saved carts (overrides config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (takes precedence over project and global config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the courses that can be added to a cart
    Catalog,

    /// Show a user's cart
    Show {
        /// User whose cart to show
        #[arg(long)]
        user: String,
    },

    /// Add courses to a user's cart
    Add {
        #[arg(long)]
        user: String,

        /// Course IDs from the catalog
        #[arg(required = true)]
        courses: Vec<String>,
    },

    /// Remove a course from a user's cart
    Remove {
        #[arg(long)]
        user: String,

        /// Course ID to remove
        course: String,
    },

    /// Empty a user's cart
    Clear {
        #[arg(long)]
        user: String,
    },

    /// Sign a user out, discarding their saved cart
    Logout {
        #[arg(long)]
        user: String,
    },

    /// List saved carts
    Carts,

    /// Interactive storefront session
    Shell {
        /// Sign in as this user on start
        #[arg(long)]
        user: Option<String>,

        /// Display name for the signed-in user
        #[arg(long)]
        name: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("warn".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build a storefront over SQLite.
/// `--db` takes highest precedence, then config files, then the default location.
fn open_storefront(cli: &Cli) -> Result<Storefront> {
    let mut config =
        CartConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(ref db) = cli.db {
        config.storage_path = Some(db.clone());
    }
    debug!(storage = ?config.storage_path, "opening storefront");

    Storefront::builder()
        .config(config)
        .sqlite_storage()
        .context("failed to initialize cart storage")?
        .build()
        .context("failed to build storefront")
}

fn shopper(id: &str, name: Option<&str>) -> User {
    let user = User::new(id, format!("{}@course-cart.local", id));
    match name {
        Some(name) => user.with_name(name),
        None => user,
    }
}

fn print_drawer(shop: &Storefront) {
    if let Some(snapshot) = shop.render() {
        print!("{}", snapshot);
    }
}

fn print_nav(shop: &Storefront) {
    match shop.greeting() {
        Some(greeting) => {
            let badge = shop
                .badge()
                .map(|count| format!(" [cart: {}]", count))
                .unwrap_or_default();
            println!("{}{}", greeting, badge);
        }
        None => println!("Not signed in (login <user> [name])"),
    }
}

fn print_catalog(shop: &Storefront) {
    let symbol = &shop.config().currency_symbol;
    println!("{:<6} {:<40} {:<26} PRICE", "ID", "TITLE", "INSTRUCTOR");
    println!("{}", "-".repeat(80));
    for course in shop.catalog().courses() {
        println!(
            "{:<6} {:<40} {:<26} {}",
            course.id,
            course.title,
            course.instructor,
            price_label(course.price, symbol)
        );
    }
}

const SHELL_HELP: &str = "\
commands:
  login <user> [name]   sign in
  logout                sign out (discards the saved cart)
  catalog               list courses
  add <course>          add a course to the cart
  remove <course>       remove a course from the cart
  cart                  open/close the cart drawer
  remove-all            ask to remove all items
  confirm               confirm remove all
  checkout              open checkout
  buy                   complete the purchase
  continue              close checkout and keep shopping
  cancel                cancel the open prompt or checkout
  help                  show this help
  quit                  exit";

/// Apply one shell line. Returns false when the shell should exit.
fn handle_line(shop: &mut Storefront, line: &str, now: Instant) -> bool {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return true;
    };
    let arg = words.next();

    let outcome: Result<(), String> = match (command, arg) {
        ("quit" | "exit", _) => return false,
        ("help", _) => {
            println!("{}", SHELL_HELP);
            Ok(())
        }
        ("login", Some(user)) => {
            let name = words.collect::<Vec<_>>().join(" ");
            let name = (!name.is_empty()).then_some(name);
            shop.login(shopper(user, name.as_deref()));
            Ok(())
        }
        ("logout", _) => {
            shop.logout();
            Ok(())
        }
        ("catalog", _) => {
            print_catalog(shop);
            Ok(())
        }
        ("add", Some(course)) => match shop.add_to_cart(course, now) {
            Ok(true) => Ok(()),
            Ok(false) if shop.user().is_none() => Err("sign in to use the cart".to_string()),
            Ok(false) => Err(format!("{} is already in the cart", course)),
            Err(e) => Err(e.to_string()),
        },
        ("remove", Some(course)) => shop
            .remove_from_cart(course, now)
            .then_some(())
            .ok_or_else(|| format!("{} is not in the cart", course)),
        ("cart", _) => {
            if shop.user().is_none() {
                Err("sign in to use the cart".to_string())
            } else {
                shop.toggle_cart();
                Ok(())
            }
        }
        ("remove-all", _) => shop
            .request_remove_all()
            .then_some(())
            .ok_or_else(|| "open a non-empty cart first".to_string()),
        ("confirm", _) => shop
            .confirm_remove_all()
            .then_some(())
            .ok_or_else(|| "nothing to confirm".to_string()),
        ("checkout", _) => shop
            .open_checkout()
            .then_some(())
            .ok_or_else(|| "open a non-empty cart first".to_string()),
        ("buy", _) => shop
            .buy(now)
            .then_some(())
            .ok_or_else(|| "open checkout first".to_string()),
        ("continue", _) => shop
            .cancel_checkout()
            .then_some(())
            .ok_or_else(|| "checkout is not open".to_string()),
        ("cancel", _) => (shop.cancel_remove_all() || shop.cancel_checkout())
            .then_some(())
            .ok_or_else(|| "nothing to cancel".to_string()),
        _ => Err(format!("unknown command: {} (try 'help')", line.trim())),
    };

    match outcome {
        Ok(()) => {
            print_nav(shop);
            print_drawer(shop);
        }
        Err(message) => println!("{}", message),
    }
    true
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

async fn run_shell(mut shop: Storefront) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_nav(&shop);

    loop {
        let deadline = shop.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if !handle_line(&mut shop, &line, Instant::now()) {
                    break;
                }
            }
            _ = sleep_until(deadline) => {
                if shop.advance(Instant::now()) > 0 {
                    print_drawer(&shop);
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut shop = open_storefront(&cli)?;

    match cli.command {
        Commands::Catalog => print_catalog(&shop),

        Commands::Show { ref user } => {
            shop.login(shopper(user, None));
            shop.toggle_cart();
            print_drawer(&shop);
        }

        Commands::Add {
            ref user,
            ref courses,
        } => {
            shop.login(shopper(user, None));
            for course in courses {
                let added = shop
                    .add_to_cart(course, Instant::now())
                    .with_context(|| format!("failed to add {}", course))?;
                if added {
                    info!(user = %user, course = %course, "added to cart");
                    println!("Added {} to cart", course);
                } else {
                    println!("{} is already in the cart", course);
                }
            }
        }

        Commands::Remove {
            ref user,
            ref course,
        } => {
            shop.login(shopper(user, None));
            if shop.remove_from_cart(course, Instant::now()) {
                println!("Removed {} from cart", course);
            } else {
                println!("{} is not in the cart", course);
            }
        }

        Commands::Clear { ref user } => {
            shop.login(shopper(user, None));
            shop.toggle_cart();
            let count = shop.store().len();
            if shop.request_remove_all() && shop.confirm_remove_all() {
                println!("Removed {} item(s) from cart", count);
            } else {
                println!("Cart is already empty");
            }
        }

        Commands::Logout { ref user } => {
            shop.login(shopper(user, None));
            shop.logout();
            println!("Signed out {}", user);
        }

        Commands::Carts => {
            let carts = stored_carts(shop.store().storage())?;
            if carts.is_empty() {
                println!("No saved carts.");
                return Ok(());
            }

            println!("{:<20} {:>5} {:>10}", "USER", "ITEMS", "TOTAL");
            println!("{}", "-".repeat(37));
            for cart in carts {
                println!("{}", cart);
            }
        }

        Commands::Shell { ref user, ref name } => {
            if let Some(user) = user {
                shop.login(shopper(user, name.as_deref()));
            }
            println!("{}", SHELL_HELP);
            run_shell(shop).await?;
        }
    }

    Ok(())
}
