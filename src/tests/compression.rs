#[cfg(test)]
mod test {
    use crate::{
        hatanaka::target_name,
        prelude::*,
        tests::toolkit::{random_name, resource, ACOR_R},
    };
    use std::{
        fs::{copy as fs_copy, create_dir_all, remove_dir_all, remove_file as fs_remove_file},
        path::{Path, PathBuf},
    };

    /// Copies a test resource into a scratch directory
    fn scratch_copy(name: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(random_name(12));
        create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs_copy(resource(ACOR_R), &path).unwrap();
        (dir, path)
    }

    /// Stands for RNX2CRX or CRX2RNX: renames the file, content is preserved
    fn rename(path: &Path, direction: Direction) -> Result<PathBuf, ToolError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let target = path.with_file_name(target_name(&name, direction)?);
        fs_copy(path, &target)?;
        fs_remove_file(path)?;
        Ok(target)
    }

    #[test]
    fn hatanaka_workflow() {
        let (dir, path) = scratch_copy(ACOR_R);
        let rnx2crx = |path: &Path| rename(path, Direction::Compress);
        let crx2rnx = |path: &Path| rename(path, Direction::Decompress);
        let never = |path: &Path| -> Result<PathBuf, ToolError> {
            panic!("should not transform {}", path.display())
        };

        let mut file = ObsFile::new(&path);
        assert!(!file.is_hatanaka_compressed());
        assert!(!file.is_gzip_compressed());

        file.crx2rnx(&never).unwrap();
        file.rnx2crx(&rnx2crx).unwrap();
        assert_eq!(file.path(), dir.join("ACOR00ESP_R_20183100000_01D_30S_MO.crx"));
        assert!(file.is_hatanaka_compressed());
        assert!(!path.exists());

        file.rnx2crx(&never).unwrap();
        file.crx2rnx(&crx2rnx).unwrap();
        assert_eq!(file.path(), path.as_path());
        assert!(!file.is_hatanaka_compressed());
        assert_eq!(file.stat().unwrap().num_epochs, 10);

        let _ = remove_dir_all(&dir);
    }

    #[test]
    fn missing_tool() {
        let (dir, path) = scratch_copy(ACOR_R);
        let mut file = ObsFile::new(&path);
        let tool = ExternalTool::new("rinex-obs-no-such-tool", Direction::Compress);
        assert!(matches!(file.rnx2crx(&tool), Err(ToolError::Missing(_))));
        assert_eq!(file.path(), path.as_path());
        assert!(path.exists());
        let _ = remove_dir_all(&dir);
    }

    #[test]
    #[cfg(feature = "flate2")]
    fn compression() {
        let (dir, path) = scratch_copy(ACOR_R);
        let rnx2crx = |path: &Path| rename(path, Direction::Compress);
        let never = |path: &Path| -> Result<PathBuf, ToolError> {
            panic!("should not transform {}", path.display())
        };

        let mut file = ObsFile::new(&path);
        file.compress(&rnx2crx).unwrap();
        assert_eq!(
            file.path(),
            dir.join("ACOR00ESP_R_20183100000_01D_30S_MO.crx.gz")
        );
        assert!(file.is_gzip_compressed());
        assert!(file.is_hatanaka_compressed());
        assert!(!dir.join("ACOR00ESP_R_20183100000_01D_30S_MO.crx").exists());

        // content was only renamed, gzip layer is transparent
        let stats = file.stat().unwrap();
        assert_eq!(stats.num_epochs, 10);

        file.compress(&never).unwrap();

        let gz_only = ObsFile::new(dir.join("ACOR00ESP_R_20183100000_01D_30S_MO.rnx.gz"));
        assert!(matches!(
            gz_only.clone().compress(&never),
            Err(ToolError::CompressedInput(_))
        ));

        let _ = remove_dir_all(&dir);
    }
}
