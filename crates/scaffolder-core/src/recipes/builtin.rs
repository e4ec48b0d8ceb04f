//! Recipes for the built-in catalog
//!
//! React projects are assumed to follow the create-react-app layout (`src/index`,
//! `src/App`, plain CSS next to them), Angular projects the Angular CLI layout.

use super::{Edit, Framework, Recipe, RecipeContext};
use crate::extensions::builtin as names;
use crate::source::{FormatStyle, ImportDescriptor, StyleOverrides, TrailingComma};

/// Recipe for the extension called `name`, or `None` when it has none
pub fn recipe_for(
    name: &str,
    context: &RecipeContext,
    overrides: &StyleOverrides,
) -> Option<Recipe> {
    let recipe = match name {
        names::REACT => Recipe::new().generator("npx create-react-app ."),
        names::ANGULAR => Recipe::new()
            .generator("npx @angular/cli new app --directory . --style css --skip-git"),
        names::TYPESCRIPT => typescript(context),
        names::SASS => stylesheets(context, "scss", &["sass"]),
        names::LESS => stylesheets(context, "less", &["less"]),
        names::STYLUS => stylesheets(context, "styl", &["stylus"]),
        names::REDUX => redux(context),
        names::MOBX => mobx(context),
        names::NGRX => ngrx(),
        names::ESLINT => eslint(context),
        names::PRETTIER => prettier(overrides),
        names::ESLINT_PRETTIER => Recipe::new()
            .dev_packages(["eslint-config-prettier"])
            .edit(Edit::replace(
                ".eslintrc.json",
                "\"eslint:recommended\"",
                "\"eslint:recommended\", \"prettier\"",
            )),
        _ => return None,
    };
    Some(recipe)
}

fn typescript(context: &RecipeContext) -> Recipe {
    match context.framework {
        // Angular projects are generated as TypeScript already
        Some(Framework::Angular) => Recipe::new(),
        Some(Framework::React) => Recipe::new()
            .dev_packages(["typescript", "@types/node", "@types/react", "@types/react-dom"])
            .edit(Edit::rename("src/index.js", "src/index.tsx"))
            .edit(Edit::rename("src/App.js", "src/App.tsx"))
            .edit(Edit::write("tsconfig.json", tsconfig(true))),
        None => Recipe::new()
            .dev_packages(["typescript"])
            .edit(Edit::write("tsconfig.json", tsconfig(false))),
    }
}

fn tsconfig(jsx: bool) -> String {
    let jsx = if jsx { "\n    \"jsx\": \"react-jsx\"," } else { "" };
    format!(
        r#"{{
  "compilerOptions": {{
    "target": "es2020",
    "lib": ["dom", "dom.iterable", "esnext"],
    "module": "esnext",
    "moduleResolution": "node",{jsx}
    "strict": true,
    "esModuleInterop": true,
    "skipLibCheck": true,
    "noEmit": true
  }},
  "include": ["src"]
}}
"#
    )
}

/// Swap plain CSS for a preprocessor
fn stylesheets(context: &RecipeContext, ext: &str, packages: &[&str]) -> Recipe {
    let recipe = Recipe::new().dev_packages(packages.iter().copied());

    match context.framework {
        Some(Framework::React) => {
            let script = context.script_ext(true);
            let index = format!("src/index.{}", script);
            let app = format!("src/App.{}", script);
            recipe.edits([
                Edit::rename("src/index.css", format!("src/index.{}", ext)),
                Edit::remove_import(&index, "./index.css"),
                Edit::add_import(&index, ImportDescriptor::side_effect(format!("./index.{}", ext))),
                Edit::rename("src/App.css", format!("src/App.{}", ext)),
                Edit::remove_import(&app, "./App.css"),
                Edit::add_import(&app, ImportDescriptor::side_effect(format!("./App.{}", ext))),
            ])
        }
        Some(Framework::Angular) => {
            let styles = format!("src/styles.{}", ext);
            let component = format!("./app.component.{}", ext);
            recipe.edits([
                Edit::rename("src/styles.css", &styles),
                // build and test targets both list the global stylesheet
                Edit::replace("angular.json", "src/styles.css", &styles),
                Edit::replace("angular.json", "src/styles.css", &styles),
                Edit::rename(
                    "src/app/app.component.css",
                    format!("src/app/app.component.{}", ext),
                ),
                Edit::replace(
                    "src/app/app.component.ts",
                    "./app.component.css",
                    component,
                ),
            ])
        }
        None => recipe,
    }
}

fn redux(context: &RecipeContext) -> Recipe {
    let index = format!("src/index.{}", context.script_ext(true));
    Recipe::new()
        .packages(["@reduxjs/toolkit", "react-redux"])
        .edit(Edit::write(
            format!("src/store.{}", context.script_ext(false)),
            "import { configureStore } from '@reduxjs/toolkit'\n\n\
             export const store = configureStore({ reducer: {} })\n",
        ))
        .edit(Edit::add_import(
            &index,
            ImportDescriptor::named(["Provider"], "react-redux"),
        ))
        .edit(Edit::add_import(
            &index,
            ImportDescriptor::named(["store"], "./store"),
        ))
        .edit(Edit::replace(
            &index,
            "<App />",
            "<Provider store={store}><App /></Provider>",
        ))
}

fn mobx(context: &RecipeContext) -> Recipe {
    Recipe::new()
        .packages(["mobx", "mobx-react-lite"])
        .edit(Edit::write(
            format!("src/stores/counter.{}", context.script_ext(false)),
            "import { makeAutoObservable } from 'mobx'\n\n\
             export class CounterStore {\n  count = 0\n\n  \
             constructor() {\n    makeAutoObservable(this)\n  }\n\n  \
             increment() {\n    this.count += 1\n  }\n}\n\n\
             export const counterStore = new CounterStore()\n",
        ))
}

fn ngrx() -> Recipe {
    Recipe::new()
        .packages(["@ngrx/store"])
        .edit(Edit::write(
            "src/app/app.state.ts",
            "import { StoreModule } from '@ngrx/store'\n\n\
             export const AppStoreModule = StoreModule.forRoot({})\n",
        ))
        .edit(Edit::add_to_array(
            "src/app/app.module.ts",
            "imports",
            ImportDescriptor::named(["AppStoreModule"], "./app.state"),
        ))
}

fn eslint(context: &RecipeContext) -> Recipe {
    let mut extends = Vec::new();
    let mut dev_packages = vec!["eslint"];
    if context.framework == Some(Framework::React) {
        extends.push("\"react-app\"");
        dev_packages.push("eslint-config-react-app");
    }
    if context.typescript {
        extends.push("\"plugin:@typescript-eslint/recommended\"");
        dev_packages.extend(["@typescript-eslint/parser", "@typescript-eslint/eslint-plugin"]);
    }
    // Kept last so configs layered on later can append after it
    extends.push("\"eslint:recommended\"");

    let parser = if context.typescript {
        "  \"parser\": \"@typescript-eslint/parser\",\n"
    } else {
        ""
    };
    let config = format!(
        "{{\n  \"root\": true,\n{}  \"extends\": [{}]\n}}\n",
        parser,
        extends.join(", ")
    );

    Recipe::new()
        .dev_packages(dev_packages)
        .edit(Edit::write(".eslintrc.json", config))
}

fn prettier(overrides: &StyleOverrides) -> Recipe {
    let style = FormatStyle::resolve(overrides);
    let config = format!(
        "singleQuote: {}\nsemi: {}\ntrailingComma: {}\nprintWidth: {}\n",
        style.single_quote,
        style.semi,
        match style.trailing_comma {
            TrailingComma::All => "all",
            TrailingComma::Es5 => "es5",
            TrailingComma::None => "none",
        },
        style.print_width
    );

    Recipe::new()
        .dev_packages(["prettier"])
        .edit(Edit::write(".prettierrc.yaml", config))
        .edit(Edit::write(".prettierignore", "build\ndist\nnode_modules\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react(typescript: bool) -> RecipeContext {
        RecipeContext {
            typescript,
            framework: Some(Framework::React),
        }
    }

    #[test]
    fn test_every_builtin_has_a_recipe() {
        let catalog = crate::extensions::builtin::catalog().unwrap();
        for extension in catalog.iter() {
            assert!(
                recipe_for(&extension.name, &react(false), &StyleOverrides::default()).is_some(),
                "{} has no recipe",
                extension.name
            );
        }
        assert!(recipe_for("Vue", &react(false), &StyleOverrides::default()).is_none());
    }

    #[test]
    fn test_frameworks_carry_generator() {
        let overrides = StyleOverrides::default();
        assert!(recipe_for(names::REACT, &react(false), &overrides)
            .unwrap()
            .generator
            .is_some());
        assert!(recipe_for(names::SASS, &react(false), &overrides)
            .unwrap()
            .generator
            .is_none());
    }

    #[test]
    fn test_stylesheet_edits_follow_script_flavor() {
        let recipe = recipe_for(names::SASS, &react(true), &StyleOverrides::default()).unwrap();
        assert_eq!(recipe.dev_packages, vec!["sass".to_string()]);
        assert!(recipe
            .edits
            .contains(&Edit::remove_import("src/index.tsx", "./index.css")));
        assert!(recipe
            .edits
            .contains(&Edit::rename("src/App.css", "src/App.scss")));
    }

    #[test]
    fn test_eslint_config_ends_with_recommended() {
        let recipe = recipe_for(names::ESLINT, &react(true), &StyleOverrides::default()).unwrap();
        let Edit::WriteFile { content, .. } = &recipe.edits[0] else {
            panic!("expected a written config");
        };
        assert!(content.contains("\"eslint:recommended\"]"));
        assert!(content.contains("@typescript-eslint/parser"));
    }

    #[test]
    fn test_prettier_config_mirrors_style() {
        let overrides = StyleOverrides {
            semi: Some(true),
            ..StyleOverrides::default()
        };
        let recipe = recipe_for(names::PRETTIER, &react(false), &overrides).unwrap();
        assert_eq!(
            recipe.edits[0],
            Edit::write(
                ".prettierrc.yaml",
                "singleQuote: true\nsemi: true\ntrailingComma: all\nprintWidth: 80\n"
            )
        );
    }
}
