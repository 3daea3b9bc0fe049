use clap::{Args, Parser, Subcommand};

use crate::types::{MealType, Muscle, ProgramKind};

#[derive(Parser)]
#[command(name = "tramax", version, about = "CLI fitness tracker")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// User accounts
    #[command(subcommand, visible_alias = "u")]
    User(UserCmd),

    /// Body profile and BMI
    #[command(subcommand)]
    Profile(ProfileCmd),

    /// Program management
    #[command(subcommand, visible_alias = "p")]
    Program(ProgramCmd),

    /// Show today's workout, weekly history and streak
    #[command(visible_alias = "st")]
    Status {
        /// User index, name or email
        user: String,

        /// Evaluate as of this date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Mark today's workout as completed
    #[command(visible_alias = "c")]
    Complete {
        /// User index, name or email
        user: String,

        /// Complete this date instead of today (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Exercise catalog
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// Food catalog and meal logging
    #[command(subcommand, visible_alias = "n")]
    Nutrition(NutritionCmd),

    /// Show completed training days in a calendar view
    #[command(visible_alias = "cal")]
    Calendar {
        /// User index, name or email
        user: String,

        /// Year to show (defaults to current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month to show (1-12, defaults to current month)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// View or edit tramax config
    #[command(subcommand)]
    Config(ConfigCmd),
}

//
// Commands
//

#[derive(Subcommand)]
pub enum UserCmd {
    /// Register a new user
    #[command(visible_alias = "r")]
    Register {
        /// Display name
        name: String,

        /// Email address (unique)
        #[arg(short, long)]
        email: String,
    },

    /// List all users
    #[command(visible_alias = "l")]
    List,
}

#[derive(Subcommand)]
pub enum ProfileCmd {
    /// Show a user's body profile
    #[command(visible_alias = "s")]
    Show {
        /// User index, name or email
        user: String,
    },

    /// Set age, weight and height (BMI is recomputed)
    Set {
        /// User index, name or email
        user: String,

        /// Age in years (13-100)
        #[arg(short, long)]
        age: u32,

        /// Weight in kg (30-300)
        #[arg(short, long)]
        weight: f64,

        /// Height in cm (120-250)
        #[arg(long)]
        height: f64,
    },
}

#[derive(Subcommand)]
pub enum ProgramCmd {
    /// Create a program for a user
    #[command(visible_alias = "c")]
    Create(CreateArgs),

    /// List a user's programs
    #[command(visible_alias = "l")]
    List {
        /// User index, name or email
        user: String,
    },

    /// Show the active program in detail
    #[command(visible_alias = "s")]
    Show {
        /// User index, name or email
        user: String,
    },

    /// Pause the active program
    Pause {
        /// User index, name or email
        user: String,
    },

    /// Resume a paused program
    Resume {
        /// User index, name or email
        user: String,
    },

    /// Deactivate (archive) the active program
    Deactivate {
        /// User index, name or email
        user: String,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// User index, name or email
    pub user: String,

    /// Which kind of program to create
    #[arg(short, long, value_enum, default_value_t = ProgramKind::Template)]
    pub kind: ProgramKind,

    /// Custom program name (custom kind only)
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ExerciseCmd {
    /// Add a new exercise
    #[command(visible_alias = "a")]
    Add {
        /// Exercise name
        name: String,

        /// Primary muscle group
        #[arg(short, long)]
        muscle: String,

        /// Exercise description
        #[arg(short, long)]
        desc: Option<String>,

        /// Estimated calories burned per minute
        #[arg(short, long, default_value_t = 5.0)]
        calories: f64,
    },

    /// Import exercises from a TOML file
    #[command(visible_alias = "i")]
    Import {
        /// Path to TOML file
        file: String,
    },

    /// List all exercises
    #[command(visible_alias = "l")]
    List {
        /// Filter by muscle group
        #[arg(short, long)]
        muscle: Option<Muscle>,
    },

    /// Delete an exercise
    #[command(visible_alias = "d")]
    Delete {
        /// Exercise index or name
        exercise: String,
    },
}

#[derive(Subcommand)]
pub enum NutritionCmd {
    /// Add a food to the catalog
    FoodAdd {
        /// Food name
        name: String,

        /// Calories per 100 g
        #[arg(short, long)]
        calories: f64,

        /// Protein grams per 100 g
        #[arg(long)]
        protein: Option<f64>,

        /// Carbohydrate grams per 100 g
        #[arg(long)]
        carbs: Option<f64>,

        /// Fat grams per 100 g
        #[arg(long)]
        fat: Option<f64>,

        /// Fiber grams per 100 g
        #[arg(long)]
        fiber: Option<f64>,
    },

    /// List the food catalog
    Foods,

    /// Log a meal for a user
    #[command(visible_alias = "l")]
    Log {
        /// User index, name or email
        user: String,

        /// Food index or name
        food: String,

        /// Amount eaten, in grams
        #[arg(short, long)]
        grams: f64,

        /// Meal slot
        #[arg(short, long, value_enum)]
        meal: MealType,
    },

    /// Show a day's meals and totals
    #[command(visible_alias = "s")]
    Show {
        /// User index, name or email
        user: String,

        /// Day to show (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}
