//! File built-ins. Every operation is single-action: it opens, performs
//! its one read or write, and releases the handle before returning, even
//! on failure.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::capability::native::{
    expect_args, expect_range, string_arg, CallError, NativeFunction,
};
use crate::value::Value;

pub(crate) fn entries() -> Vec<NativeFunction> {
    vec![
        NativeFunction::from_closure("redread", read),
        NativeFunction::from_closure("redwrite", write),
        NativeFunction::from_closure("redappend", append),
        NativeFunction::from_closure("redexists", exists),
        NativeFunction::from_closure("redlistdir", listdir),
        NativeFunction::from_closure("redmkdir", mkdir),
        NativeFunction::from_closure("redremove", remove),
        NativeFunction::from_closure("redcwd", cwd),
    ]
}

fn read(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redread", &args, 1)?;
    let path = string_arg("redread", &args, 0)?;
    Ok(Value::String(fs::read_to_string(path)?))
}

fn write(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redwrite", &args, 2)?;
    let path = string_arg("redwrite", &args, 0)?;
    let content = string_arg("redwrite", &args, 1)?;
    fs::write(path, content)?;
    Ok(Value::Boolean(true))
}

fn append(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redappend", &args, 2)?;
    let path = string_arg("redappend", &args, 0)?;
    let content = string_arg("redappend", &args, 1)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(Value::Boolean(true))
}

fn exists(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redexists", &args, 1)?;
    let path = string_arg("redexists", &args, 0)?;
    Ok(Value::Boolean(Path::new(path).exists()))
}

fn listdir(args: Vec<Value>) -> Result<Value, CallError> {
    expect_range("redlistdir", &args, 0, 1)?;
    let path = if args.is_empty() {
        "."
    } else {
        string_arg("redlistdir", &args, 0)?
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(path)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(Value::List(names.into_iter().map(Value::String).collect()))
}

fn mkdir(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redmkdir", &args, 1)?;
    let path = string_arg("redmkdir", &args, 0)?;
    fs::create_dir_all(path)?;
    Ok(Value::Boolean(true))
}

fn remove(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redremove", &args, 1)?;
    let path = string_arg("redremove", &args, 0)?;
    fs::remove_file(path)?;
    Ok(Value::Boolean(true))
}

fn cwd(args: Vec<Value>) -> Result<Value, CallError> {
    expect_args("redcwd", &args, 0)?;
    let dir = std::env::current_dir()?;
    Ok(Value::String(dir.to_string_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_value(path: &std::path::Path) -> Value {
        Value::String(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_write_read_append() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.txt");

        assert_eq!(
            write(vec![path_value(&file), Value::String("one\n".to_string())]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            append(vec![path_value(&file), Value::String("two".to_string())]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            read(vec![path_value(&file)]).unwrap(),
            Value::String("one\ntwo".to_string())
        );
    }

    #[test]
    fn test_exists_listdir_remove() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        write(vec![path_value(&file), Value::String(String::new())]).unwrap();

        assert_eq!(
            exists(vec![path_value(&file)]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            listdir(vec![path_value(dir.path())]).unwrap(),
            Value::List(vec![Value::String("a.txt".to_string())])
        );
        assert_eq!(
            remove(vec![path_value(&file)]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            exists(vec![path_value(&file)]).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_read_missing_file_fails() {
        assert!(read(vec![Value::String("/definitely/not/here".to_string())]).is_err());
    }
}
