mod common;

#[cfg(test)]
#[cfg(feature = "clap")]
mod test_impute {
    use super::*;

    use snpfill::clap::{run_cmd, SubCommand};

    #[test]
    fn impute_full_matrix() {
        let hierarchy = common::write_test_hierarchy("impute_full").unwrap();

        let cmd = SubCommand::Impute {
            args: common::standard_args(hierarchy, "full"),
            log_and_verbosity: common::silent_verbosity(),
            threads: 2,
            min_abs_cor: 0.1,
            seed: Some(1),
            npy: false,
        };
        run_cmd(cmd).unwrap();

        // rs1 and rs2 resolve from each other through the root group and
        // rs3, fully missing, becomes the flipped copy of its medoid rs2
        let res = std::fs::read_to_string("tests/results/full_imputed.csv").unwrap();
        assert_eq!(
            "sample,rs1,rs2,rs3\n\
             s1,0,0,2\n\
             s2,0,0,2\n\
             s3,0,1,1\n\
             s4,1,0,2\n\
             s5,0,0,2\n\
             s6,2,0,2\n",
            res
        );
    }

    #[test]
    fn impute_writes_npy() {
        let hierarchy = common::write_test_hierarchy("impute_npy").unwrap();

        let cmd = SubCommand::Impute {
            args: common::standard_args(hierarchy, "npy"),
            log_and_verbosity: common::silent_verbosity(),
            threads: 2,
            min_abs_cor: 0.1,
            seed: Some(1),
            npy: true,
        };
        run_cmd(cmd).unwrap();

        let dosages: ndarray::Array2<u8> =
            ndarray_npy::read_npy("tests/results/npy_imputed.npy").unwrap();
        assert_eq!((6, 3), dosages.dim());
        // 255 marks a missing call; none survive imputation
        assert!(dosages.iter().all(|&d| d <= 2));
    }

    #[test]
    fn impute_medoids_leaves_cluster_members_missing() {
        let hierarchy = common::write_test_hierarchy("impute_medoids").unwrap();

        let cmd = SubCommand::ImputeMedoids {
            args: common::standard_args(hierarchy, "medoids"),
            log_and_verbosity: common::silent_verbosity(),
            threads: 2,
            min_abs_cor: 0.25,
            seed: Some(1),
        };
        run_cmd(cmd).unwrap();

        let res = std::fs::read_to_string("tests/results/medoids_imputed_medoids.csv").unwrap();
        assert_eq!(
            "sample,rs1,rs2,rs3\n\
             s1,0,0,NA\n\
             s2,0,0,NA\n\
             s3,0,1,NA\n\
             s4,1,0,NA\n\
             s5,0,0,NA\n\
             s6,2,0,NA\n",
            res
        );
    }

    #[test]
    fn impute_is_deterministic() {
        let hierarchy = common::write_test_hierarchy("impute_det").unwrap();

        for prefix in ["det1", "det2"] {
            let cmd = SubCommand::Impute {
                args: common::standard_args(hierarchy.clone(), prefix),
                log_and_verbosity: common::silent_verbosity(),
                threads: 2,
                min_abs_cor: 0.1,
                seed: Some(7),
                npy: false,
            };
            run_cmd(cmd).unwrap();
        }

        let first = std::fs::read_to_string("tests/results/det1_imputed.csv").unwrap();
        let second = std::fs::read_to_string("tests/results/det2_imputed.csv").unwrap();
        assert_eq!(first, second);
    }
}
