//! CLI module - Command-line interface for Registrar
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Registrar - Student Management System administration
/// Owns the relational schema and its migrations
#[derive(Parser)]
#[command(name = "registrar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    #[command(alias = "up")]
    Migrate,

    /// Show applied and pending migrations
    #[command(alias = "st")]
    Status,

    /// Verify database integrity (connectivity, username uniqueness)
    Check {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-entity row counts
    Stats {
        /// Emit the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect user accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users with their usernames
    #[command(alias = "ls")]
    List,

    /// Show the usernames a backfill would assign, without writing
    Preview,
}

pub use commands::*;
