use clap::{Parser, Subcommand};
use shiftflake::{DEFAULT_EPOCH, Method, Options};

/// Command-line configuration for the `shiftflake` binary.
///
/// Every generator setting can also come from the environment (or a `.env`
/// file). Defaults match [`Options::new`]. Range checks are left to the
/// library so the rules live in one place.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shiftflake",
    version,
    about = "Issue and decode Snowflake-style IDs with drift and rollback compensation"
)]
pub struct CliArgs {
    /// Generation method: 0 waits on exhaustion, anything else drifts.
    ///
    /// Environment variable: `SHIFTFLAKE_METHOD`
    #[arg(long, env = "SHIFTFLAKE_METHOD", default_value_t = 1)]
    pub method: u16,

    /// Base instant in Unix milliseconds. Must not be in the future.
    ///
    /// Environment variable: `SHIFTFLAKE_EPOCH`
    #[arg(long, env = "SHIFTFLAKE_EPOCH", default_value_t = DEFAULT_EPOCH)]
    pub epoch: i64,

    /// Worker id embedded in every ID. Must be unique per running generator.
    ///
    /// Environment variable: `SHIFTFLAKE_WORKER_ID`
    #[arg(long, env = "SHIFTFLAKE_WORKER_ID", default_value_t = 0)]
    pub worker_id: u32,

    /// Width of the worker field in bits.
    ///
    /// Environment variable: `SHIFTFLAKE_WORKER_BITS`
    #[arg(long, env = "SHIFTFLAKE_WORKER_BITS", default_value_t = 6)]
    pub worker_bits: u8,

    /// Width of the sequence field in bits.
    ///
    /// Environment variable: `SHIFTFLAKE_SEQ_BITS`
    #[arg(long, env = "SHIFTFLAKE_SEQ_BITS", default_value_t = 6)]
    pub seq_bits: u8,

    /// Largest sequence value issued within one millisecond.
    ///
    /// Environment variable: `SHIFTFLAKE_MAX_SEQ`
    #[arg(long, env = "SHIFTFLAKE_MAX_SEQ", default_value_t = 63)]
    pub max_seq: u32,

    /// Sequence value each millisecond starts from (values below 5 are
    /// reserved).
    ///
    /// Environment variable: `SHIFTFLAKE_MIN_SEQ`
    #[arg(long, env = "SHIFTFLAKE_MIN_SEQ", default_value_t = 5)]
    pub min_seq: u32,

    /// Slots the drift method may run ahead of the clock before waiting.
    ///
    /// Environment variable: `SHIFTFLAKE_MAX_DRIFT_STEPS`
    #[arg(long, env = "SHIFTFLAKE_MAX_DRIFT_STEPS", default_value_t = 2000)]
    pub max_drift_steps: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print freshly issued IDs, one per line.
    Generate {
        /// How many IDs to issue.
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Print the timestamp, worker id and sequence field of each ID.
    Decode {
        /// IDs to decode.
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

impl From<&CliArgs> for Options {
    fn from(args: &CliArgs) -> Self {
        Self {
            method: Method::from_code(args.method),
            epoch: args.epoch,
            worker_id: args.worker_id,
            worker_bits: args.worker_bits,
            seq_bits: args.seq_bits,
            max_seq: args.max_seq,
            min_seq: args.min_seq,
            max_drift_steps: args.max_drift_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_options() {
        let args = CliArgs::try_parse_from(["shiftflake", "generate"]).unwrap();
        assert_eq!(Options::from(&args), Options::new(0));
    }

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "shiftflake",
            "--method",
            "0",
            "--worker-id",
            "9",
            "--seq-bits",
            "10",
            "--max-seq",
            "1023",
            "decode",
            "1",
            "2",
        ])
        .unwrap();
        let opts = Options::from(&args);
        assert_eq!(opts.method, Method::Basic);
        assert_eq!(opts.worker_id, 9);
        assert_eq!(opts.seq_bits, 10);
        assert_eq!(opts.max_seq, 1023);
        assert!(matches!(args.command, Command::Decode { ref ids } if ids == &[1, 2]));
    }

    #[test]
    fn decode_requires_ids() {
        assert!(CliArgs::try_parse_from(["shiftflake", "decode"]).is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }
}
