use super::render;
use super::setup::Commands;
use anyhow::{bail, Context, Result};
use filemap::{delete_directory, Codec, FileMap, StorageRoot};
use serde_json::Value;

pub struct AppContext {
    pub root: StorageRoot,
    pub map_name: String,
    pub codec: Codec,
}

impl AppContext {
    fn open(&self) -> Result<FileMap<Value>> {
        FileMap::open_with_codec(&self.root, &self.map_name, self.codec)
            .with_context(|| format!("Failed to open map {:?}", self.map_name))
    }
}

pub fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::List { keys } => list(ctx, keys),
        Commands::Get { key } => get(ctx, &key),
        Commands::Set { key, value, raw } => set(ctx, key, &value, raw),
        Commands::Remove { key } => remove(ctx, &key),
        Commands::Clear => clear(ctx),
        Commands::Files => files(ctx),
        Commands::Doctor => doctor(ctx),
        Commands::Drop => drop_map(ctx),
    }
}

fn list(ctx: &AppContext, keys_only: bool) -> Result<()> {
    let map = ctx.open()?;
    let entries: Vec<(&str, &Value)> = map.iter().collect();
    print!("{}", render::list(&entries, keys_only));
    Ok(())
}

fn get(ctx: &AppContext, key: &str) -> Result<()> {
    let map = ctx.open()?;
    match map.get(key) {
        Some(value) => println!("{}", render::value(value)),
        None => bail!("No value for key {:?}", key),
    }
    Ok(())
}

pub(crate) fn parse_value(input: &str, raw: bool) -> Result<Value> {
    if raw {
        return Ok(Value::String(input.to_string()));
    }
    serde_json::from_str(input)
        .with_context(|| format!("Not valid JSON: {} (use --raw to store text)", input))
}

fn set(ctx: &AppContext, key: String, input: &str, raw: bool) -> Result<()> {
    let value = parse_value(input, raw)?;
    let mut map = ctx.open()?;
    let previous = map.set(key.clone(), value)?;
    println!("{}", render::stored(&key, previous.is_some()));
    Ok(())
}

fn remove(ctx: &AppContext, key: &str) -> Result<()> {
    let mut map = ctx.open()?;
    let previous = map.remove(key)?;
    println!("{}", render::removed(key, previous.is_some()));
    Ok(())
}

fn clear(ctx: &AppContext) -> Result<()> {
    let mut map = ctx.open()?;
    let report = map.clear()?;
    print!("{}", render::cleared(&report));
    if !report.is_clean() {
        bail!("{} entries could not be removed", report.failures.len());
    }
    Ok(())
}

fn files(ctx: &AppContext) -> Result<()> {
    let map = ctx.open()?;
    print!("{}", render::lines(&map.file_names()?));
    Ok(())
}

fn doctor(ctx: &AppContext) -> Result<()> {
    let map = ctx.open()?;
    let check = map.check()?;
    print!("{}", render::doctor(map.path(), &check, map.last_recovery()));
    Ok(())
}

fn drop_map(ctx: &AppContext) -> Result<()> {
    delete_directory(&ctx.root, &ctx.map_name)?;
    println!("Deleted map {:?}", ctx.map_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_json() {
        assert_eq!(parse_value("42", false).unwrap(), json!(42));
        assert_eq!(
            parse_value(r#"{"name":"apples"}"#, false).unwrap(),
            json!({"name": "apples"})
        );
    }

    #[test]
    fn test_parse_value_raw() {
        assert_eq!(parse_value("hello", true).unwrap(), json!("hello"));
        assert!(parse_value("hello", false).is_err());
    }

    #[test]
    fn test_dispatch_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = AppContext {
            root: StorageRoot::new(temp.path()),
            map_name: "resources".to_string(),
            codec: Codec::Json,
        };

        dispatch(
            &ctx,
            Commands::Set {
                key: "apples".to_string(),
                value: "1".to_string(),
                raw: false,
            },
        )
        .unwrap();
        assert!(dispatch(&ctx, Commands::Get { key: "apples".to_string() }).is_ok());
        assert!(dispatch(&ctx, Commands::Get { key: "pears".to_string() }).is_err());

        dispatch(&ctx, Commands::Remove { key: "apples".to_string() }).unwrap();
        let map = ctx.open().unwrap();
        assert!(map.is_empty());

        dispatch(&ctx, Commands::Drop).unwrap();
        assert!(!temp.path().join("resources").exists());
    }
}
