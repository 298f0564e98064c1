//! Command line interface

use crate::Crd2JsonSchemaError;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use crd2jsonschema_generator::filename::DEFAULT_FILENAME_FORMAT;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("crd2jsonschema")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Convert Kubernetes CustomResourceDefinitions into JSON Schema files")
            .arg(
                Arg::new("input")
                    .help("CRD file, directory of YAML files, or http(s) URL")
                    .value_name("FILE")
                    .num_args(1..)
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("filename-format")
                    .long("filename-format")
                    .help("Output file name template ({kind}, {group}, {fullgroup}, {version})")
                    .value_name("TEMPLATE")
                    .env("FILENAME_FORMAT")
                    .default_value(DEFAULT_FILENAME_FORMAT),
            )
            .arg(
                Arg::new("output-dir")
                    .short('o')
                    .long("output-dir")
                    .help("Directory to write schemas to")
                    .value_name("DIR")
                    .default_value("."),
            )
            .arg(
                Arg::new("filter")
                    .short('f')
                    .long("filter")
                    .help("Only convert API versions matching this glob (e.g. 'cert-manager.io/*')")
                    .value_name("GLOB")
                    .action(ArgAction::Append),
            )
            .arg(
                Arg::new("allow-null-optional-fields")
                    .long("allow-null-optional-fields")
                    .help("Accept null for fields not listed as required")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        let inputs = utils::get_inputs(matches);
        if inputs.is_empty() {
            return Err(Crd2JsonSchemaError::MissingInput.into());
        }

        let config = utils::load_config(matches)?;
        let app = crate::Crd2JsonSchema::new(config)?;

        let result = app.run(&inputs).await?;

        for path in &result.schema_files {
            println!("JSON schema written to {}", path.display());
        }

        Ok(())
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use clap::ArgMatches;

    /// Positional inputs in the order given
    pub fn get_inputs(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("input")
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    /// Build the configuration from arguments and environment
    pub fn load_config(matches: &ArgMatches) -> Result<crate::Config> {
        let mut config = crate::Config::default();

        if let Some(format) = matches.get_one::<String>("filename-format") {
            config = config.with_filename_format(format)?;
        }

        if let Some(output_dir) = matches.get_one::<String>("output-dir") {
            config = config.with_output_dir(output_dir);
        }

        config.filters = matches
            .get_many::<String>("filter")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        config.output.transform.allow_null_optional_fields =
            matches.get_flag("allow-null-optional-fields");

        config.validate()?;
        Ok(config)
    }
}
