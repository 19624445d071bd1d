use anyhow::Result;
use fire_dataset::{resolve_split, DatasetConfig, Split, SplitSource};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn touch(path: impl AsRef<Path>) {
    let path = path.as_ref();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

#[test]
fn list_file_keeps_existing_entries_in_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("firedetn");
    let config_dir = dir.path().to_owned();

    touch(root.join("images/c.jpg"));
    touch(root.join("images/a.jpg"));
    touch(root.join("images/b.png"));
    // only present relative to the config directory
    touch(config_dir.join("extra/d.jpg"));
    let absolute = dir.path().join("elsewhere/e.jpg");
    touch(&absolute);

    let list = format!(
        "# generated by autosplit\n\
         ./images/c.jpg\n\
         ./images/missing_1.jpg\n\
         \n\
         images/a.jpg\n\
         extra/d.jpg\n\
         {}\n\
         ./images/missing_2.jpg\n\
         ./images/b.png\n",
        absolute.display()
    );
    fs::write(root.join("autosplit_test.txt"), list)?;

    let images = resolve_split(&root, "autosplit_test.txt", &config_dir)?;

    let expect: Vec<PathBuf> = vec![
        root.join("./images/c.jpg"),
        root.join("images/a.jpg"),
        config_dir.join("extra/d.jpg"),
        absolute,
        root.join("./images/b.png"),
    ];
    assert_eq!(images.paths(), expect.as_slice());
    assert_eq!(images.missing().len(), 2);
    assert_eq!(
        images.source(),
        Some(&SplitSource::ListFile(root.join("autosplit_test.txt")))
    );
    Ok(())
}

#[test]
fn list_entries_naming_directories_are_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("firedetn");

    touch(root.join("images/a.jpg"));
    touch(root.join("images/sub/b.jpg"));
    fs::write(
        root.join("autosplit_train.txt"),
        "./images/a.jpg\n./images/sub\n./images/sub/b.jpg\n",
    )?;

    let images = resolve_split(&root, "autosplit_train.txt", dir.path())?;
    assert_eq!(
        images.paths(),
        &[root.join("./images/a.jpg"), root.join("./images/sub/b.jpg")]
    );
    assert_eq!(images.missing(), &[root.join("./images/sub")]);
    Ok(())
}

#[test]
fn list_file_falls_back_to_config_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("dataset");
    let config_dir = dir.path().join("configs");

    touch(root.join("images/a.jpg"));
    fs::create_dir_all(&config_dir)?;
    fs::write(config_dir.join("val.txt"), "images/a.jpg\n")?;

    let images = resolve_split(&root, "val.txt", &config_dir)?;
    assert_eq!(images.paths(), &[root.join("images/a.jpg")]);
    assert_eq!(
        images.source(),
        Some(&SplitSource::ListFile(config_dir.join("val.txt")))
    );
    Ok(())
}

#[test]
fn unknown_list_file_is_empty() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let images = resolve_split(dir.path(), "autosplit_val.txt", dir.path())?;
    assert!(images.is_empty());
    assert!(images.source().is_none());
    Ok(())
}

#[test]
fn directory_collects_recognized_images() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();

    touch(root.join("images/test/a.jpg"));
    touch(root.join("images/test/b.JPEG"));
    touch(root.join("images/test/c.Png"));
    touch(root.join("images/test/notes.txt"));
    touch(root.join("images/test/d.bmp"));
    touch(root.join("images/test/nested/e.jpg"));

    let images = resolve_split(root, "images/test", root)?;
    let mut names: Vec<_> = images
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();
    names.sort();

    assert_eq!(names, vec!["a.jpg", "b.JPEG", "c.Png"]);
    Ok(())
}

#[test]
fn missing_directory_falls_back_to_images() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    touch(root.join("images/a.jpg"));

    let images = resolve_split(root, "images/test", root)?;
    assert_eq!(images.paths(), &[root.join("images/a.jpg")]);
    assert_eq!(
        images.source(),
        Some(&SplitSource::Directory(root.join("images")))
    );
    Ok(())
}

#[test]
fn directory_without_images_is_empty() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    touch(root.join("images/readme.md"));
    touch(root.join("images/a.gif"));

    let images = resolve_split(root, "images", root)?;
    assert!(images.is_empty());
    Ok(())
}

#[test]
fn dataset_config_resolves_relative_root() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(dir.path().join("datasets/fire/images/a.jpg"));
    touch(dir.path().join("datasets/fire/images/b.jpg"));
    fs::write(
        dir.path().join("datasets/fire/autosplit_train.txt"),
        "./images/b.jpg\n",
    )?;

    let config_file = dir.path().join("fire.yaml");
    fs::write(
        &config_file,
        "path: datasets/fire\ntrain: autosplit_train.txt\nnames:\n  0: fire\n",
    )?;

    let config = DatasetConfig::open(&config_file)?;
    let root = dir.path().join("datasets/fire");
    assert_eq!(config.root, root);

    let train = config.resolve(Split::Train)?;
    assert_eq!(train.paths(), &[root.join("./images/b.jpg")]);

    // no test entry, so the images directory is used
    assert_eq!(config.resolve(Split::Test)?.len(), 2);
    Ok(())
}
