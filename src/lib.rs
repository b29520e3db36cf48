/*!
# Hydrogen Transport Materials Dashboard

A browser-based dashboard for exploring published hydrogen transport
properties of materials, built in Rust.

## Overview

Two collections of Arrhenius-law properties are served side by side:
diffusivities and solubilities. Each record describes a material, the
hydrogen isotope it was measured with, the publication it comes from, and
the two Arrhenius parameters (pre-exponential factor and activation energy)
valid over a temperature range.

The user narrows the collection with material, isotope, author and
publication-year filters. Every output of the dashboard is recomputed from
those filters: the property-vs-temperature graph, breakdown pie charts, an
entries-per-year histogram, a citations bar chart and a literature table.
The selection can be exported as JSON, CSV, XLSX or a Python script that
reproduces it, and new properties can be added at runtime.

## Architecture

### Frontend Layer
- **Technologies**: HTML (handlebars template), CSS, JavaScript
- **Key Components**:
  - Tabs - one per property kind
  - Filter controls - multi-selects, year range, colour grouping
  - Charts - server rendered SVG swapped into the page
  - Add property dialog - submits a form and reports `Error!` inline

### Backend Layer
- **Technologies**: Rust, axum, plotters
- **Core Components**:
  - Property model - Arrhenius evaluation and curve sampling
  - Property store - the two in-memory collections behind locks
  - Filter engine - conjunctive filtering by material, isotope, author, year
  - Figure builders - renderer-independent chart descriptions
  - Controller - binds control values to the builders and exports

### Data Layer
- JSON or CSV files, one per property kind
- A bundled sample dataset when no data directory is configured

## Modules

- **property**: Arrhenius property model, isotopes and bibliographic sources
- **store**: Shared in-memory property collections
- **loader**: JSON/CSV loading and validation
- **filter**: Filter constraints and the filtering operation
- **figures**: Graph, pie, citations and per-year chart descriptions
- **table**: Literature table rows
- **export**: JSON data export and Python script generation
- **downloader**: CSV and XLSX export of the literature table
- **controller**: Reactive bindings of the dashboard controls
- **config**: TOML and environment configuration
- **error**: Crate error type
- **graph**: SVG rendering of figures (feature `web`)
- **app**: Routing and handlers (feature `web`)

## REST API Endpoints

- `GET /` - Dashboard page
- `GET /api/{kind}/options` - Dropdown and slider values
- `POST /api/{kind}/figure/{chart}` - Chart description as JSON
- `POST /api/{kind}/render/{chart}` - Chart rendered as SVG
- `POST /api/{kind}/table` - Literature table rows
- `POST /api/{kind}/export/{data,python,csv,xlsx}` - Downloads
- `POST /api/{kind}/properties` - Add a custom property
*/

pub mod config;
pub mod controller;
pub mod downloader;
pub mod error;
pub mod export;
pub mod figures;
pub mod filter;
pub mod loader;
pub mod property;
pub mod store;
pub mod table;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod graph;

pub use config::Config;
pub use controller::Controller;
pub use error::{DashboardError, Result};
pub use filter::{FilterConstraints, filter_properties};
pub use property::{ArrheniusProperty, BibSource, Isotope, PropertyKind};
pub use store::PropertyStore;
