use fm_core::{
    analysis::Analyzer,
    config::Config,
    model::{expr::Expr, FeatureModel, GroupKind},
};

fn phone() -> FeatureModel {
    let mut model = FeatureModel::new("Phone");
    model.add_child("Phone", "Screen", true);
    model.add_child("Phone", "GPS", false);
    model.add_child("Phone", "Camera", false);
    model.add_child("Screen", "Basic", false);
    model.add_child("Screen", "HighRes", false);
    model.add_child("Camera", "Flash", false);
    model.set_group("Screen", GroupKind::Alternative);
    model
}

mod analyzer {
    use super::*;

    #[test]
    fn plain_tree() {
        let model = phone();
        let mut analyzer = Analyzer::new(&model, &Config::default()).unwrap();

        assert_eq!(analyzer.is_void(), Ok(false));
        assert_eq!(analyzer.dead_features(), Ok(vec![]));
        assert_eq!(analyzer.false_optional_features(), Ok(vec![]));
        assert_eq!(
            analyzer.core_features(),
            Ok(vec!["Phone".to_owned(), "Screen".to_owned()])
        );
    }

    #[test]
    fn anomalies() {
        let mut model = phone();
        model.constraints.push(Expr::not(Expr::var("Basic")));
        model.constraints.push(Expr::implies(Expr::var("HighRes"), Expr::var("GPS")));
        model.constraints.push(Expr::implies(Expr::var("Flash"), Expr::var("Basic")));

        let mut analyzer = Analyzer::new(&model, &Config::default()).unwrap();

        assert_eq!(analyzer.is_void(), Ok(false));
        assert_eq!(
            analyzer.dead_features(),
            Ok(vec!["Basic".to_owned(), "Flash".to_owned()])
        );
        // Basic is dead rather than false-optional, and Flash has a selectable parent but is dead.
        assert_eq!(
            analyzer.false_optional_features(),
            Ok(vec!["GPS".to_owned(), "HighRes".to_owned()])
        );
    }

    #[test]
    fn void_model() {
        let mut model = phone();
        model.constraints.push(Expr::not(Expr::var("Screen")));

        let mut analyzer = Analyzer::new(&model, &Config::default()).unwrap();
        assert_eq!(analyzer.is_void(), Ok(true));
        assert_eq!(analyzer.dead_features().map(|dead| dead.len()), Ok(7));
    }

    #[test]
    fn compile_errors_surface() {
        let mut model = phone();
        model.constraints.push(Expr::var("Keyboard"));
        assert!(Analyzer::new(&model, &Config::default()).is_err());
    }
}
